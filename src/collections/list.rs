//! Index arithmetic shared by the positional range commands (`LRANGE`, `ZRANGE`).

/// Normalizes a Redis-style inclusive index range against a collection length.
///
/// Negative indices count from the end (-1 is the last element). Out-of-range
/// bounds are clamped. Returns an error when the clamped range selects nothing.
///
/// # Examples
///
/// ```text
/// // For a collection of length 5:
/// // normalize_range(5, 0, 2)   -> Ok((0, 2))
/// // normalize_range(5, -2, -1) -> Ok((3, 4))
/// // normalize_range(5, 5, 10)  -> Err("Start index is out of bounds")
/// ```
pub fn normalize_range(
    len: usize,
    start_index: i64,
    end_index: i64,
) -> Result<(usize, usize), &'static str> {
    let len = len as i64;

    if len == 0 {
        return Err("Collection is empty");
    }

    let mut start = if start_index < 0 {
        len + start_index
    } else {
        start_index
    };
    let mut end = if end_index < 0 {
        len + end_index
    } else {
        end_index
    };

    start = start.max(0);
    end = end.min(len - 1);

    if start >= len {
        return Err("Start index is out of bounds");
    }

    if start > end {
        return Err("Start index is bigger than end index after processing");
    }

    Ok((start as usize, end as usize))
}
