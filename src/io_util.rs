use std::{path::Path, fs::read_to_string};

use anyhow::{Result, anyhow, Context};

use crate::props::Props;


pub fn my_read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    read_to_string(&path).with_context(
        || anyhow!("opening path for reading: {:?}", path.as_ref()))
}

/// Read a JSON object file as a properties bag.
pub fn read_props_file<P: AsRef<Path>>(path: P) -> Result<Props> {
    let s = my_read_to_string(&path)?;
    let json: serde_json::Value = serde_json::from_str(&s).with_context(
        || anyhow!("parsing JSON from {:?}", path.as_ref()))?;
    Props::from_json(json).with_context(
        || anyhow!("reading properties from {:?}", path.as_ref()))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn t_read_props_file() {
        let path = std::env::temp_dir().join(
            format!("htmlfill-t_read_props_file-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"title": "<T>", "n": 1.5}"#).unwrap();
        let props = read_props_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(props.get("title"), Some(&Value::from("<T>")));
        assert_eq!(props.get("n"), Some(&Value::Float(1.5)));
        assert!(read_props_file(&path).is_err());
    }
}
