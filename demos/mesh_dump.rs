use spinemesh::{ConvertOptions, convert};
use std::{env, fs, path::Path, process};

fn usage() -> ! {
    eprintln!(
        "Usage:\n  mesh_dump <skeleton.json> <atlas.atlas> [--texture-size WxH] [--adjust X,Y] [--skin <name>]\n"
    );
    process::exit(2);
}

fn read_to_string(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))
}

fn parse_texture_size(s: &str) -> Result<[u32; 2], String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("invalid --texture-size {s}"))?;
    let w = w.parse().map_err(|_| format!("invalid --texture-size {s}"))?;
    let h = h.parse().map_err(|_| format!("invalid --texture-size {s}"))?;
    Ok([w, h])
}

fn parse_adjust(s: &str) -> Result<[f32; 2], String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("invalid --adjust {s}"))?;
    let x = x.parse().map_err(|_| format!("invalid --adjust {s}"))?;
    let y = y.parse().map_err(|_| format!("invalid --adjust {s}"))?;
    Ok([x, y])
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        usage();
    }

    let skeleton_path = Path::new(&args[0]);
    let atlas_path = Path::new(&args[1]);

    let mut options = ConvertOptions::default();
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--texture-size" => {
                i += 1;
                let value = args.get(i).ok_or("missing value for --texture-size")?;
                options.actual_texture_size = Some(parse_texture_size(value)?);
            }
            "--adjust" => {
                i += 1;
                let value = args.get(i).ok_or("missing value for --adjust")?;
                options.size_adjustment = parse_adjust(value)?;
            }
            "--skin" => {
                i += 1;
                let value = args.get(i).ok_or("missing value for --skin")?;
                options.skin = Some(value.clone());
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    let skeleton_json = read_to_string(skeleton_path)?;
    let atlas_text = read_to_string(atlas_path)?;

    let conversion = convert(&skeleton_json, &atlas_text, &options)
        .map_err(|e| format!("conversion failed: {e}"))?;

    let geometry = &conversion.geometry;
    println!(
        "geometry: {} vertices, {} faces",
        geometry.vertices.len(),
        geometry.faces.len()
    );

    for (face_index, (face, region)) in geometry
        .faces
        .iter()
        .zip(&geometry.face_regions)
        .enumerate()
    {
        let uvs = &geometry.uvs[face_index];
        println!(
            "face {face_index} [{region}]: v({}, {}, {}) uv({:.4},{:.4} {:.4},{:.4} {:.4},{:.4})",
            face[0], face[1], face[2], uvs[0][0], uvs[0][1], uvs[1][0], uvs[1][1], uvs[2][0],
            uvs[2][1]
        );
    }

    if conversion.diagnostics.is_empty() {
        println!("diagnostics: none");
    } else {
        println!("diagnostics:");
        for diagnostic in &conversion.diagnostics {
            println!("  - {diagnostic}");
        }
    }

    Ok(())
}

fn main() {
    if let Err(message) = run() {
        eprintln!("{message}");
        process::exit(1);
    }
}
