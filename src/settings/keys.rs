//! Keys this crate reads and writes inside the profile's preferences document.

/// Claude Code section: `{ env, credentials }` (historically a flat env map).
pub const CLAUDE_CODE: &str = "claudeCode";

/// Codex section: `{ env }`.
pub const CODEX: &str = "codex";

/// Pre-rename Codex section: a flat env map with no `env` wrapper.
/// Read for backwards compatibility, dropped on every save.
pub const LEGACY_CODEX_CLI: &str = "codexCLI";

/// Member holding an agent's environment variable map.
pub const ENV: &str = "env";

/// Member holding Claude Code's credential object.
pub const CREDENTIALS: &str = "credentials";
