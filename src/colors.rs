/// Built-in color maps as `(src, dst)` hex pairs, in match priority order.
pub const RAILJET: [(&str, &str); 2] = [
    // dark red → white
    ("#a40000", "#ffffff"),
    // light red → dark blue
    ("#e31e1d", "#0057ae"),
];

pub fn builtin(name: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match name {
        "railjet" => Some(&RAILJET[..]),
        _ => None,
    }
}
