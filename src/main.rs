//! Tuya HAP bridge - operator CLI
//!
//! Loads the bridge configuration, sets up one accessory per configured
//! device and runs a single characteristic read or write against it.

use tuya_hap_bridge::{
    client::{TimeoutClient, TuyaWebClient},
    logging::{init_logging, LogConfig},
    Accessory, BridgeConfig, CharacteristicKind, CharacteristicValue, RemoteDeviceClient,
};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

/// Tuya HAP bridge configuration
#[derive(Parser, Debug)]
#[command(name = "tuya-hap-bridge")]
#[command(about = "Read and write Tuya Web device characteristics")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "TUYA_BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List configured devices and the characteristics they expose
    List,
    /// Read a characteristic
    Get {
        /// Device id
        #[arg(short, long)]
        device: String,

        /// Characteristic (e.g. rotation-speed, on)
        #[arg(short = 'C', long)]
        characteristic: CharacteristicKind,
    },
    /// Write a characteristic
    Set {
        /// Device id
        #[arg(short, long)]
        device: String,

        /// Characteristic (e.g. rotation-speed, on)
        #[arg(short = 'C', long)]
        characteristic: CharacteristicKind,

        /// Value to write
        value: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BridgeConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BridgeConfig::default(),
    };
    config.apply_env()?;

    let mut log_config = LogConfig::from_settings(&config.logging).with_env_overrides();
    if cli.debug {
        log_config.level = Level::DEBUG;
    }
    init_logging(log_config)?;

    config.validate()?;
    info!(
        "Tuya HAP bridge {} against {}",
        env!("CARGO_PKG_VERSION"),
        config.tuya.base_url
    );

    let client: Arc<dyn RemoteDeviceClient> = Arc::new(TimeoutClient::new(
        TuyaWebClient::new(&config.tuya)?,
        config.tuya.timeout,
    ));

    match cli.command {
        Command::List => {
            for device in &config.devices {
                let accessory = Accessory::new(device.descriptor(), Arc::clone(&client))?;
                println!("{} ({})", device.name, device.id);
                for (kind, bounds) in accessory.characteristics() {
                    println!(
                        "  {kind}: {:?} {}..={}",
                        bounds.format, bounds.min, bounds.max
                    );
                }
            }
        }
        Command::Get {
            device,
            characteristic,
        } => {
            let accessory = open_accessory(&config, &device, &client)?;
            let adapter = accessory
                .adapter(characteristic)
                .ok_or_else(|| anyhow!("{device} does not expose {characteristic}"))?;
            match adapter.read().await? {
                Some(value) => println!("{value}"),
                None => println!("{device} reported no value for {characteristic}"),
            }
        }
        Command::Set {
            device,
            characteristic,
            value,
        } => {
            let accessory = open_accessory(&config, &device, &client)?;
            let adapter = accessory
                .adapter(characteristic)
                .ok_or_else(|| anyhow!("{device} does not expose {characteristic}"))?;
            let value = CharacteristicValue::parse_host_input(&value);
            adapter.write(value.clone()).await?;
            println!("{characteristic} = {value}");
        }
    }

    Ok(())
}

fn open_accessory(
    config: &BridgeConfig,
    device_id: &str,
    client: &Arc<dyn RemoteDeviceClient>,
) -> anyhow::Result<Accessory> {
    let device = config
        .device(device_id)
        .ok_or_else(|| anyhow!("Unknown device: {device_id}"))?;
    Ok(Accessory::new(device.descriptor(), Arc::clone(client))?)
}
