//! Subcommand implementations

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use foxdb_engine::file_io::{load_path, save_path};
use foxdb_engine::{
    BinaryRecord, BoolRecord, FloatRecord, IntRecord, Record, Store, StoreConfig, StrRecord,
};

/// Value for `set`; exactly one must be given
#[derive(Args, Debug, Default)]
#[group(required = true, multiple = false)]
pub struct ValueArgs {
    /// 32-bit signed integer
    #[arg(long, allow_hyphen_values = true)]
    pub int: Option<i32>,
    /// Boolean (true/false)
    #[arg(long = "bool")]
    pub boolean: Option<bool>,
    /// 32-bit float
    #[arg(long, allow_hyphen_values = true)]
    pub float: Option<f32>,
    /// String
    #[arg(long = "str")]
    pub string: Option<String>,
    /// File whose contents become a binary value
    #[arg(long, value_name = "FILE")]
    pub bin: Option<PathBuf>,
}

impl ValueArgs {
    fn to_record(&self, key: &str, cid: u64) -> Result<Record> {
        let record: Record = if let Some(v) = self.int {
            IntRecord::new(key, v).into()
        } else if let Some(v) = self.boolean {
            BoolRecord::new(key, v).into()
        } else if let Some(v) = self.float {
            FloatRecord::new(key, v).into()
        } else if let Some(v) = &self.string {
            StrRecord::new(key, v).into()
        } else if let Some(path) = &self.bin {
            let data =
                fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            BinaryRecord::new(key, cid, &data).into()
        } else {
            bail!("no value given");
        };
        Ok(record)
    }
}

/// Read store settings from an optional TOML file
pub fn load_config(path: Option<&Path>) -> Result<StoreConfig> {
    let Some(path) = path else {
        return Ok(StoreConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: StoreConfig =
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn open(path: &Path) -> Result<Store> {
    load_path(path).with_context(|| format!("loading {}", path.display()))
}

fn save(store: &Store, path: &Path, config: StoreConfig) -> Result<()> {
    save_path(store, path, config).with_context(|| format!("saving {}", path.display()))
}

pub fn init<W: Write>(path: &Path, force: bool, config: StoreConfig, out: &mut W) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    save(&Store::new(), path, config)?;
    info!("Created empty store at {}", path.display());
    writeln!(out, "created {}", path.display())?;
    Ok(())
}

pub fn dump<W: Write>(path: &Path, out: &mut W) -> Result<()> {
    let store = open(path)?;
    writeln!(
        out,
        "total_size={} records={}",
        store.total_size(),
        store.len()
    )?;
    for (offset, record) in store.iter() {
        let kind = match record.record_type() {
            Some(t) => t.to_string(),
            None => format!("tag{}", record.type_tag()),
        };
        let value = match record.value() {
            Ok(v) => v.to_string(),
            Err(e) => format!("<invalid: {}>", e),
        };
        writeln!(
            out,
            "{:>8} {:>8} {:<6} {} = {}",
            offset,
            record.size(),
            kind,
            record.key(),
            value
        )?;
    }
    Ok(())
}

pub fn get<W: Write>(path: &Path, key: &str, out: &mut W) -> Result<()> {
    let store = open(path)?;
    let Some(record) = store.get(key) else {
        bail!("key not found: {}", key);
    };
    writeln!(out, "{}", record.value()?)?;
    Ok(())
}

pub fn set<W: Write>(
    path: &Path,
    key: &str,
    value: &ValueArgs,
    cid: u64,
    config: StoreConfig,
    out: &mut W,
) -> Result<()> {
    let mut store = open(path)?;
    let record = value.to_record(key, cid)?;

    let action = if store.contains_key(key) {
        store.update(record)?;
        "updated"
    } else {
        store.insert(record)?;
        "inserted"
    };
    save(&store, path, config)?;
    writeln!(out, "{} {}", action, key)?;
    Ok(())
}

pub fn remove<W: Write>(path: &Path, key: &str, config: StoreConfig, out: &mut W) -> Result<()> {
    let mut store = open(path)?;
    if store.remove(key).is_none() {
        bail!("key not found: {}", key);
    }
    save(&store, path, config)?;
    writeln!(out, "removed {}", key)?;
    Ok(())
}

pub fn verify<W: Write>(path: &Path, out: &mut W) -> Result<()> {
    let store = open(path)?;
    store.verify()?;
    writeln!(
        out,
        "ok: {} records, {} bytes",
        store.len(),
        store.total_size()
    )?;
    Ok(())
}
