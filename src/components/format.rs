//! Display-only transforms shared by the screens.

/// Uppercases the first character, leaves the rest alone.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn join_capitalized(names: &[String]) -> String {
    names
        .iter()
        .map(|name| capitalize(name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `value / 10` without a trailing `.0`.
pub fn format_tenths(value: u32) -> String {
    let whole = value / 10;
    let frac = value % 10;
    if frac == 0 {
        whole.to_string()
    } else {
        format!("{whole}.{frac}")
    }
}

pub fn format_height(decimetres: u32) -> String {
    format!("{} m", format_tenths(decimetres))
}

pub fn format_weight(decagrams: u32) -> String {
    format!("{} kg", format_tenths(decagrams))
}

/// Filled cells for a stat bar: the raw value read as a percentage, capped at 100.
pub fn stat_bar_cells(base_value: u16, width: u16) -> u16 {
    let percent = u32::from(base_value.min(100));
    (percent * u32::from(width) / 100) as u16
}

pub fn stat_bar(base_value: u16, width: u16) -> String {
    let filled = stat_bar_cells(base_value, width) as usize;
    let empty = (width as usize).saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

pub fn entry_number(id: u32) -> String {
    format!("#{id:03}")
}
