use is_terminal::IsTerminal;

/// Whether standard output should receive ANSI colors in auto mode.
///
/// Respects the `NO_COLOR` convention (https://no-color.org).
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    std::io::stdout().is_terminal()
}
