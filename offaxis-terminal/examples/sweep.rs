/// Example: Print perceived hinge angles across a sweep of viewing angles
///
/// Usage: cargo run --example sweep -- [path/to/display.json]
use std::env;
use std::io;

use offaxis_core::{DisplayConfig, ViewingConditions, ViewingMode};

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let config = match args.get(1) {
        Some(path) => {
            println!("Loading display config: {}", path);
            DisplayConfig::load(path).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("Failed to load config: {}", e))
            })?
        }
        None => {
            eprintln!("No display config provided, using a 27\" 16:9 screen...");
            DisplayConfig::default()
        }
    };

    let size = config.screen_size();
    println!("Screen: {:.1} x {:.1} cm", size.x, size.y);

    let mut conditions = ViewingConditions::new(config.screen_basis());
    println!(
        "Authored for {:.1} cm on axis, eye separation {:.1} cm, hinge {:.0} deg\n",
        conditions.projection_distance(),
        conditions.eye_separation(),
        conditions.hinge().angle
    );
    println!("{:>10} {:>12} {:>12}", "view deg", "mono deg", "stereo deg");

    for step in -6..=6 {
        let angle = step as f32 * 10.0;
        conditions
            .set_viewing_angle(angle)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

        let mono = conditions.summary(ViewingMode::Monoscopic);
        let stereo = conditions.summary(ViewingMode::Stereoscopic);
        println!(
            "{:>10.0} {:>12.1} {:>12.1}",
            angle, mono.perceived_angle, stereo.perceived_angle
        );
    }

    Ok(())
}
