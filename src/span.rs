use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ExtractError, Result};

/// Byte length of each record, measured to the next distinct start address.
///
/// Duplicates collapse to one entry. The highest address has no successor and
/// gets a span of 0, meaning "unknown length".
pub fn record_spans<I>(addresses: I) -> Result<BTreeMap<u32, u32>>
where
    I: IntoIterator<Item = u32>,
{
    let sorted: BTreeSet<u32> = addresses.into_iter().collect();
    if sorted.is_empty() {
        return Err(ExtractError::InvalidInput(
            "cannot compute record spans of an empty address set".to_string(),
        ));
    }

    let mut spans = BTreeMap::new();
    let mut iter = sorted.iter().peekable();
    while let Some(&addr) = iter.next() {
        let span = match iter.peek() {
            Some(&&next) => next - addr,
            None => 0,
        };
        spans.insert(addr, span);
    }
    Ok(spans)
}
