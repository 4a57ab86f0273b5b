//! System-wide constants shared by the pipeline and the CLI.

/// Template field naming the parent template(s) an entry inherits from.
///
/// Holds nothing, a single template name, or an ordered sequence of names.
/// Stripped from resolved templates before rendering.
pub const BASED_ON_KEY: &str = "based_on";

/// Instance field naming the template the instance is built from. Mandatory.
pub const TEMPLATE_KEY: &str = "template";

/// Rendered configuration field listing linked container names.
///
/// Each entry may carry an `:alias` suffix; the link target is the text
/// before the first colon.
pub const LINKS_KEY: &str = "links";

/// Rendered configuration field that must be present and non-null.
pub const IMAGE_KEY: &str = "image";

/// Context variable under which an instance's own name is exposed while its
/// template renders.
pub const CONFIG_NAME_KEY: &str = "CONTAINER_CONFIG_NAME";

/// Host-framework sentinel marking a value as intentionally omitted.
///
/// Occurrences of this prefix followed by 40 hex digits are stripped from
/// strings before rendering.
pub const OMIT_PLACEHOLDER_PREFIX: &str = "__omit_place_holder__";

/// Hex digit count following [`OMIT_PLACEHOLDER_PREFIX`] in a sentinel token.
pub const OMIT_PLACEHOLDER_HEX_LEN: usize = 40;

/// Application name used in CLI output.
pub const APP_NAME: &str = "convoy";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "convoy";

/// Default manifest file name the CLI looks for.
pub const DEFAULT_MANIFEST: &str = "convoy.yaml";
