pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
pub const TITLE: &str = "Stream Wall";
pub const PROMPT: &str = "> ";

pub const EMPTY_STATE: &str = "No streams added";
pub const UNSUPPORTED_TEXT: &str = "HLS not supported";

pub const LABEL_MUTED: &str = "[muted]";
pub const LABEL_UNMUTED: &str = "[sound]";

pub const ELLIPSIS: char = '…';
pub const MIN_CARD_WIDTH: usize = 24;
pub const CARD_GAP: usize = 2;

pub const HELP_TEXT: &str = "\
Commands:
  <url> | add <url>       add an .m3u8 stream
  remove <n|url>          remove a stream
  mute <n|url>            toggle sound for one stream
  play | pause            play or pause every stream
  mute-all | unmute-all   mute or unmute every stream
  clear                   remove every stream
  grid <columns>          set the number of columns
  export                  write the list to a JSON file
  import [path]           replace the list from a JSON file
  help | quit";
