use autojump::{
    AdbController, DeviceController, Error, JumpConfig, ReplayController, Result, Template,
    TurnController,
};
use clap::Parser;
use parking_lot::Mutex;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "autojump", version)]
#[command(about = "Plays the jump game on an Android phone over adb")]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Piece template image (overrides the configuration)
    #[arg(long)]
    template: Option<PathBuf>,
    /// Device serial, when more than one device is attached
    #[arg(long)]
    serial: Option<String>,
    /// adb executable
    #[arg(long)]
    adb: Option<String>,
    /// Stop after this many turns
    #[arg(long)]
    turns: Option<u64>,
    /// Play saved screenshots from a directory instead of a phone
    #[arg(long)]
    replay: Option<PathBuf>,
    /// Restart the replay from the first screenshot when it runs out
    #[arg(long, requires = "replay")]
    replay_loop: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => JumpConfig::load(path)?,
        None => JumpConfig::default(),
    };
    if let Some(template) = cli.template {
        config = config.with_template(template);
    }
    if let Some(serial) = cli.serial {
        config = config.with_serial(serial);
    }
    if let Some(adb) = cli.adb {
        config = config.with_adb_program(adb);
    }

    log::info!("autojump {}", autojump::VERSION);
    let template = Template::load(&config.template_path)?;

    if let Some(dir) = cli.replay {
        let device = ReplayController::from_directory(&dir, cli.replay_loop)?;
        let turns = match cli.turns {
            Some(turns) => Some(turns),
            None if !cli.replay_loop => Some(device.len() as u64),
            None => None,
        };
        play(device, &template, &config, turns);
        return Ok(());
    }

    let device = AdbController::new(config.adb.clone());
    install_interrupt_handler(device.clone())?;
    play(device, &template, &config, cli.turns);
    Ok(())
}

fn play<D: DeviceController>(
    device: D,
    template: &Template,
    config: &JumpConfig,
    turns: Option<u64>,
) {
    let mut controller = TurnController::new(device, template, config, rand::rng());
    controller.check_connection();
    controller.run(turns);
}

/// On Ctrl-C, stop the adb server once and exit
fn install_interrupt_handler(device: AdbController) -> Result<()> {
    let teardown = Arc::new(Mutex::new(Some(device)));
    ctrlc::set_handler(move || {
        if let Some(mut device) = teardown.lock().take() {
            if let Err(e) = device.shutdown() {
                log::warn!("Failed to stop adb: {}", e);
            }
        }
        log::info!("bye");
        std::process::exit(0);
    })
    .map_err(|e| Error::Io(io::Error::other(e.to_string())))
}
