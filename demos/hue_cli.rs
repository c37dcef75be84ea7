//! CLI application for controlling a Hue bridge.
//!
//! This example demonstrates registering with a bridge, listing its devices
//! and controlling lights and groups.
//!
//! Run with: cargo run --example hue_cli -- --help
//! Set `RUST_LOG=huegely_rs=debug` to see every request.

use std::time::Duration;

use clap::{Parser, Subcommand};
use huegely_rs::{
    Bridge, BridgeOptions, ColorController, Device, Dimmer, Group, Light, Sensor,
    TemperatureController,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hue-cli")]
#[command(about = "Control Philips Hue lights from the command line", long_about = None)]
struct Cli {
    /// Host name or IP address of the bridge
    #[arg(short, long, global = true, env = "HUE_BRIDGE")]
    address: Option<String>,

    /// Access token issued by the bridge (see the `register` command)
    #[arg(short, long, global = true, env = "HUE_TOKEN")]
    token: Option<String>,

    /// Default transition time in milliseconds
    #[arg(long, global = true)]
    transition: Option<u64>,

    /// Address a group instead of a light
    #[arg(short, long, global = true)]
    group: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the bridge for a token. Press the link button first.
    Register {
        /// Application identifier, e.g. "hue-cli#laptop"
        #[arg(default_value = "hue-cli#huegely")]
        app: String,
    },

    /// Show the bridge configuration
    Config,

    /// List lights, groups and sensors
    List,

    /// Show the state of a light or group
    Status { id: u32 },

    /// Turn a light or group on
    On { id: u32 },

    /// Turn a light or group off
    Off { id: u32 },

    /// Set brightness (0-254, 0 turns off)
    Brightness { id: u32, level: i32 },

    /// Raise brightness by a step
    Brighter {
        id: u32,
        #[arg(default_value = "25")]
        step: i32,
    },

    /// Lower brightness by a step
    Darker {
        id: u32,
        #[arg(default_value = "25")]
        step: i32,
    },

    /// Set hue (0-65534)
    Hue { id: u32, hue: i64 },

    /// Set white color temperature in mireds (154-500)
    Temperature { id: u32, mireds: i32 },

    /// Flash a light or group once
    Alert { id: u32 },

    /// Rename a light or group
    Rename { id: u32, name: String },
}

async fn find_light(bridge: &Bridge, id: u32) -> Result<Light, Box<dyn std::error::Error>> {
    let lights = bridge.lights().await?;
    lights
        .into_iter()
        .find(|light| light.id() == id)
        .ok_or_else(|| format!("no light with id {id}").into())
}

async fn find_group(bridge: &Bridge, id: u32) -> Result<Group, Box<dyn std::error::Error>> {
    let groups = bridge.groups().await?;
    groups
        .into_iter()
        .find(|group| group.id() == id)
        .ok_or_else(|| format!("no group with id {id}").into())
}

async fn list(bridge: &Bridge) -> Result<(), Box<dyn std::error::Error>> {
    println!("Lights:");
    for light in bridge.lights().await? {
        println!("  {:3}  {:24} {}", light.id(), light.to_string(), light.light_type());
    }

    println!("\nGroups:");
    for group in bridge.groups().await? {
        println!("  {:3}  {}", group.id(), group.label());
    }

    println!("\nSensors:");
    for mut sensor in bridge.sensors().await? {
        let reading = match &mut sensor {
            Sensor::Temperature(s) => format!("{:.1}°C", s.temperature(Duration::from_secs(60)).await?),
            Sensor::Motion(s) => format!("presence: {}", s.presence(Duration::from_secs(60)).await?),
        };
        println!("  {:3}  {:24} {}", sensor.id(), sensor.to_string(), reading);
    }
    Ok(())
}

/// Runs a dimmer command against a light or group.
async fn control<D>(device: &mut D, command: &Commands) -> Result<(), Box<dyn std::error::Error>>
where
    D: Dimmer + Device + std::fmt::Display,
{
    match command {
        Commands::Status { .. } => {
            let state = device.state().await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Commands::On { .. } => {
            device.on(None).await?;
            println!("{device} turned ON");
        }
        Commands::Off { .. } => {
            device.off(None).await?;
            println!("{device} turned OFF");
        }
        Commands::Brightness { level, .. } => {
            let brightness = device.set_brightness(*level, None).await?;
            println!("{device} brightness: {brightness}");
        }
        Commands::Brighter { step, .. } => {
            let brightness = device.brighter(*step, None).await?;
            println!("{device} brightness: {brightness}");
        }
        Commands::Darker { step, .. } => {
            let brightness = device.darker(*step, None).await?;
            println!("{device} brightness: {brightness}");
        }
        Commands::Alert { .. } => {
            device.set_alert("select").await?;
            println!("{device} flashed");
        }
        Commands::Rename { name, .. } => {
            let name = device.set_name(name).await?;
            println!("Renamed to {name}");
        }
        _ => unreachable!(),
    }
    Ok(())
}

async fn set_hue<C: ColorController>(device: &mut C, hue: i64) -> Result<(), Box<dyn std::error::Error>> {
    println!("Hue set to {}", device.set_hue(hue, None).await?);
    Ok(())
}

async fn set_temperature<T: TemperatureController>(
    device: &mut T,
    mireds: i32,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Temperature set to {} mireds", device.set_temperature(mireds, None).await?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let address = cli
        .address
        .clone()
        .ok_or("bridge address is required. Use --address <HOST> or HUE_BRIDGE")?;

    let options = BridgeOptions {
        address,
        token: cli.token.clone(),
        transition_time_ms: cli.transition,
    };
    let mut bridge = Bridge::from_options(&options);

    match &cli.command {
        Commands::Register { app } => {
            println!("Registering {app} with bridge at {}...", bridge.address());
            match bridge.get_token(app).await {
                Ok(token) => {
                    bridge.set_token(&token);
                    println!("Token: {token}");
                    println!("Bridge name: {}", bridge.name().await?);
                }
                Err(e) if e.is_link_button_not_pressed() => {
                    eprintln!("Press the link button on the bridge and try again.")
                }
                Err(e) => eprintln!("Error: {e}"),
            }
        }

        Commands::Config => {
            let config = bridge.config().await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }

        Commands::List => list(&bridge).await?,

        Commands::Hue { id, hue } if cli.group => match find_group(&bridge, *id).await? {
            Group::Color(mut g) => set_hue(&mut g, *hue).await?,
            Group::ExtendedColor(mut g) => set_hue(&mut g, *hue).await?,
            g => eprintln!("{} has no color control", g.label()),
        },

        Commands::Hue { id, hue } => match find_light(&bridge, *id).await? {
            Light::Color(mut l) => set_hue(&mut l, *hue).await?,
            Light::ExtendedColor(mut l) => set_hue(&mut l, *hue).await?,
            l => eprintln!("{} has no color control", l.label()),
        },

        Commands::Temperature { id, mireds } if cli.group => {
            match find_group(&bridge, *id).await? {
                Group::ColorTemperature(mut g) => set_temperature(&mut g, *mireds).await?,
                Group::ExtendedColor(mut g) => set_temperature(&mut g, *mireds).await?,
                g => eprintln!("{} has no temperature control", g.label()),
            }
        }

        Commands::Temperature { id, mireds } => match find_light(&bridge, *id).await? {
            Light::ColorTemperature(mut l) => set_temperature(&mut l, *mireds).await?,
            Light::ExtendedColor(mut l) => set_temperature(&mut l, *mireds).await?,
            l => eprintln!("{} has no temperature control", l.label()),
        },

        Commands::Status { id }
        | Commands::On { id }
        | Commands::Off { id }
        | Commands::Brightness { id, .. }
        | Commands::Brighter { id, .. }
        | Commands::Darker { id, .. }
        | Commands::Alert { id }
        | Commands::Rename { id, .. } => {
            if cli.group {
                control(&mut find_group(&bridge, *id).await?, &cli.command).await?;
            } else {
                control(&mut find_light(&bridge, *id).await?, &cli.command).await?;
            }
        }
    }

    Ok(())
}
