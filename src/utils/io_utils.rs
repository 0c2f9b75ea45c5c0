use std::path::{Path, PathBuf};

pub fn get_app_dir() -> anyhow::Result<PathBuf> {
    let conf_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("dirs::config_dir()"))?;
    let mut path = PathBuf::from(&conf_dir);
    path.push(format!(".{}", env!("CARGO_PKG_NAME")));
    Ok(path)
}

pub fn save_json_to_config<T: serde::Serialize>(
    obj:       &T,
    conf_name: &str
) -> anyhow::Result<()> {
    let app_dir = get_app_dir()?;
    save_json_to_dir(obj, &app_dir, conf_name)
}

pub fn load_json_from_config_file<T: serde::de::DeserializeOwned>(
    obj:       &mut T,
    conf_name: &str
) -> anyhow::Result<()> {
    let app_dir = get_app_dir()?;
    load_json_from_dir(obj, &app_dir, conf_name)
}

pub fn save_json_to_dir<T: serde::Serialize>(
    obj:       &T,
    dir:       &Path,
    conf_name: &str
) -> anyhow::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    let file_name = dir.join(format!("{}.json", conf_name));
    let text = serde_json::to_string_pretty(obj)?;
    std::fs::write(file_name, text)?;
    Ok(())
}

/// Leaves `obj` untouched if the file doesn't exist yet
pub fn load_json_from_dir<T: serde::de::DeserializeOwned>(
    obj:       &mut T,
    dir:       &Path,
    conf_name: &str
) -> anyhow::Result<()> {
    let file_name = dir.join(format!("{}.json", conf_name));
    if !file_name.is_file() { return Ok(()); }
    let file = std::io::BufReader::new(std::fs::File::open(file_name)?);
    *obj = serde_json::from_reader(file)?;
    Ok(())
}
