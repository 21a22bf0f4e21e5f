use crate::error::{ExtractError, Result};

/// Renders a flat tile layer as CSV, `width` values per row.
///
/// The last row may be short. No trailing newline is written.
pub fn layer_to_csv(values: &[u16], width: usize) -> Result<String> {
    if width == 0 {
        return Err(ExtractError::InvalidInput(
            "tile layer row width must be non-zero".to_string(),
        ));
    }

    let mut out = String::with_capacity(values.len() * 4);
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(if i % width == 0 { '\n' } else { ',' });
        }
        out.push_str(&value.to_string());
    }
    Ok(out)
}
