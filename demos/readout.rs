//! Heating readout - minimal end-to-end usage of the client.
//!
//! Connects to a vcontrold daemon, reads the outside temperature, writes a
//! room setpoint and disconnects. Lifecycle logging is enabled via the
//! client's debug flag; route it with `RUST_LOG=vcontrold_client=debug`.
//!
//! ```sh
//! cargo run --example readout -- 192.168.1.10 3002
//! ```

use std::time::Duration;

use vcontrold_client::VControlClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "localhost".to_string());
    let port = args
        .next()
        .map(|p| p.parse())
        .transpose()?
        .unwrap_or(3002);

    let mut client = VControlClient::builder(&host, port)
        .timeout(Duration::from_secs(5))
        .debug(true)
        .build();

    client.connect().await?;

    let temp = client.get("getTempA").await?;
    println!("outside temperature: {temp}");

    client.set("setTempRaumNorSollM1", ["20"]).await?;
    println!("room setpoint written");

    client.close().await?;
    Ok(())
}
