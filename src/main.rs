use std::env;
use std::error::Error;
use std::str::FromStr;

use qrdot::{ECLevel, QRBuilder};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let data = args.next().unwrap_or_else(|| "Hello, world!".to_string());
    let ec_level = match args.next() {
        Some(l) => ECLevel::from_str(&l)?,
        None => ECLevel::M,
    };

    let qr = QRBuilder::new(data.as_bytes()).ec_level(ec_level).build()?;
    println!("{}", qr.to_str(1));

    Ok(())
}
