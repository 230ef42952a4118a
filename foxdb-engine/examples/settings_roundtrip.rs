//! Build a small settings store, save it, load it back and list it

use std::path::PathBuf;

use foxdb_engine::file_io::{load_path, save_path};
use foxdb_engine::{BoolRecord, FloatRecord, IntRecord, Store, StoreConfig, StrRecord};

fn main() -> foxdb_engine::FoxResult<()> {
    let args: Vec<String> = std::env::args().collect();
    let path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("settings.fox"));

    let mut store = Store::new();
    store.insert(IntRecord::new("volume", 7))?;
    store.insert(BoolRecord::new("muted", false))?;
    store.insert(FloatRecord::new("brightness", 0.8))?;
    store.insert(StrRecord::new("theme", "dark"))?;
    store.update(IntRecord::new("volume", 9))?;

    save_path(&store, &path, StoreConfig::default())?;
    println!("Saved {} bytes to {}", store.total_size(), path.display());

    let loaded = load_path(&path)?;
    loaded.iterate(|record, offset| {
        let value = record
            .value()
            .map(|v| v.to_string())
            .unwrap_or_else(|e| e.to_string());
        println!("{:>6}  {} = {}", offset, record.key(), value);
    });

    if let Some(volume) = loaded.get_int("volume")? {
        println!("volume is {}", volume.value());
    }
    Ok(())
}
