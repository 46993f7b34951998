//! hand_volume — interactive entry point.

use hand_volume::app::{run, AppConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║       Hand Volume Control — openness drives the volume       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "camera")]
    println!("  Mode: camera + MediaPipe detector");
    #[cfg(not(feature = "camera"))]
    println!("  Mode: keyboard simulation  (use --features camera for a real webcam)");
    println!();
    println!("  • Open your hand wide → volume rises");
    println!("  • Close your hand     → volume falls");
    println!("  • Continuous control, no discrete gestures");
    println!("  • Press Q to quit");
    println!();

    if let Err(e) = run(AppConfig::default()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    println!("  Volume control stopped.");
}
