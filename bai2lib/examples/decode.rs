use bai2lib::{
    formats::{bai2::Bai2, json::Json},
    traits::{ReadFormat, WriteFormat},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: декодируем BAI2 -> JSON (stdin -> stdout)
    let file = Bai2::read(std::io::BufReader::new(std::io::stdin()))?;
    Json::write(std::io::stdout(), &file)?;
    Ok(())
}
