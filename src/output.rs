use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `BIBSHELF_QUIET=1` (or `true`) silences success chatter; results and errors still print
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("BIBSHELF_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
