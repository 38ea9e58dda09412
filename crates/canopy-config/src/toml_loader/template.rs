//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Canopy Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[frames]
# hello_timeout_ms = 15000        # 1000-120000
# window_load_timeout_ms = 5000   # 500-60000
# request_timeout_ms = 10000      # 1000-120000
# default_width = 1280            # 200-16384
# default_height = 800            # 200-16384

# Hibernation is off unless one of these sections is present.
# [hibernation.idle_workspaces]
# idle_ms_threshold = 600000
#
# [hibernation.maximum_active_workspaces]
# threshold = 3                   # >= 1

[layouts]
# directory = "~/.config/canopy/layouts"

[logging]
# level = "info"                  # trace, debug, info, warn, error
"##
    .to_string()
}
