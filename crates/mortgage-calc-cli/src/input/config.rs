use mortgage_calc_core::amortization::bounds::InputBounds;
use std::fs;

/// Load calculator input bounds from a YAML (or JSON) file.
pub fn read_bounds(path: &str) -> Result<InputBounds, Box<dyn std::error::Error>> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?;
    let bounds: InputBounds = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", path, e))?;
    bounds.validate()?;
    Ok(bounds)
}

/// Bounds from `--config` when given, otherwise the calculator defaults.
pub fn bounds_or_default(path: Option<&str>) -> Result<InputBounds, Box<dyn std::error::Error>> {
    match path {
        Some(p) => read_bounds(p),
        None => Ok(InputBounds::default()),
    }
}
