// src/status.rs
use crate::models::server::{ PlayerCount, ServerRecord, ServerState };

const CHECK_TIME: &str = "检查时间";
const VERSION: &str = "服务器版本";
const PLAYERS: &str = "在线玩家";
const COUNTS: &str = "玩家数";
const ERROR: &str = "错误信息";
pub const NO_PLAYERS: &str = "当前没有在线玩家";

/// Returns the value of a `<label>: <value>` line.
fn field<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(label)?.strip_prefix(':')?;
    Some(rest.trim())
}

/// Splits a block header `Name (host:port):` into name and address.
fn parse_header(line: &str) -> (String, String) {
    let body = line.strip_suffix(':').unwrap_or(line);
    let name = body.split(" (").next().unwrap_or(body).trim().to_string();
    let address = match body.find('(') {
        Some(open) => {
            let inner = &body[open + 1..];
            inner.strip_suffix(')').unwrap_or(inner).to_string()
        }
        None => String::new(),
    };
    (name, address)
}

fn parse_players(value: &str) -> Vec<String> {
    if value.is_empty() || value == NO_PLAYERS {
        return Vec::new();
    }
    value
        .split(", ")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

fn parse_counts(value: &str) -> (PlayerCount, PlayerCount) {
    match value.split_once('/') {
        Some((current, max)) => (PlayerCount::parse(current), PlayerCount::parse(max)),
        None => (PlayerCount::parse(value), PlayerCount::UNKNOWN),
    }
}

/// Parses the status report written by the server checker.
///
/// Records are returned in the order their blocks appear. A block is kept even when
/// none of its fields follow. Lines that are not understood are skipped.
pub fn parse_status(text: &str) -> Vec<ServerRecord> {
    let mut servers: Vec<ServerRecord> = Vec::new();
    let mut check_time = String::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(ts) = field(line, CHECK_TIME) {
            check_time = ts.to_string();
            continue;
        }

        if line.ends_with(':') {
            let (name, address) = parse_header(line);
            servers.push(ServerRecord::new(name, address, check_time.clone()));
            continue;
        }

        let Some(current) = servers.last_mut() else {
            continue;
        };

        if let Some(version) = field(line, VERSION) {
            current.version = version.to_string();
            current.status = ServerState::Online;
        } else if let Some(players) = field(line, PLAYERS) {
            current.players = parse_players(players);
        } else if let Some(counts) = field(line, COUNTS) {
            let (online, max_players) = parse_counts(counts);
            current.online = online;
            current.max_players = max_players;
        } else if let Some(error) = field(line, ERROR) {
            current.error = Some(error.to_string());
        } else if line == NO_PLAYERS {
            current.players.clear();
        }
    }

    servers
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str =
        "检查时间: 2024-01-01 12:00
ServerA (play.example.com:25565):
服务器版本: 1.20.1
在线玩家: Alice, Bob
玩家数: 2/20
";

    #[test]
    fn test_single_block() {
        let servers = parse_status(SAMPLE);
        assert_eq!(servers.len(), 1);

        let server = &servers[0];
        assert_eq!(server.name, "ServerA");
        assert_eq!(server.address, "play.example.com:25565");
        assert_eq!(server.version, "1.20.1");
        assert_eq!(server.players, vec!["Alice".to_string(), "Bob".to_string()]);
        assert_eq!(server.online, PlayerCount(Some(2)));
        assert_eq!(server.max_players, PlayerCount(Some(20)));
        assert_eq!(server.status, ServerState::Online);
        assert_eq!(server.timestamp, "2024-01-01 12:00");
        assert_eq!(server.error, None);
    }

    #[test]
    fn test_parse_is_repeatable() {
        assert_eq!(parse_status(SAMPLE), parse_status(SAMPLE));
    }

    #[test]
    fn test_no_players_sentinel() {
        let text = "S (a:1):\n服务器版本: 1.21\n在线玩家: 当前没有在线玩家\n玩家数: 0/10";
        let servers = parse_status(text);
        assert!(servers[0].players.is_empty());

        // The checker also writes the sentinel on a line of its own.
        let text = "S (a:1):\n服务器版本: 1.21\n当前没有在线玩家\n玩家数: 0/10";
        let servers = parse_status(text);
        assert!(servers[0].players.is_empty());
        assert_eq!(servers[0].max_players, PlayerCount(Some(10)));
    }

    #[test]
    fn test_counts() {
        let servers = parse_status("S (a:1):\n玩家数: 5/20");
        assert_eq!(servers[0].online, PlayerCount(Some(5)));
        assert_eq!(servers[0].max_players, PlayerCount(Some(20)));
    }

    #[test]
    fn test_malformed_counts_are_unknown() {
        let servers = parse_status("S (a:1):\n玩家数: five/20");
        assert_eq!(servers[0].online, PlayerCount::UNKNOWN);
        assert_eq!(servers[0].max_players, PlayerCount(Some(20)));

        let servers = parse_status("S (a:1):\n玩家数: 7");
        assert_eq!(servers[0].online, PlayerCount(Some(7)));
        assert_eq!(servers[0].max_players, PlayerCount::UNKNOWN);
    }

    #[test]
    fn test_offline_block() {
        let text =
            "检查时间: 2024-05-01 08:00:00

1.20.1空岛 (akiyo.fun:18003):
状态: 离线
错误信息: timed out

1.21生电服 (f1ycar.fun:21009):
服务器版本: Paper 1.21
当前没有在线玩家
玩家数: 0/20";
        let servers = parse_status(text);
        assert_eq!(servers.len(), 2);

        assert_eq!(servers[0].name, "1.20.1空岛");
        assert_eq!(servers[0].status, ServerState::Offline);
        assert_eq!(servers[0].version, "");
        assert_eq!(servers[0].error.as_deref(), Some("timed out"));

        assert_eq!(servers[1].address, "f1ycar.fun:21009");
        assert!(servers[1].is_online());
        assert_eq!(servers[1].timestamp, "2024-05-01 08:00:00");
    }

    #[test]
    fn test_fields_before_block_ignored() {
        let text = "服务器版本: 1.20\n玩家数: 3/4\n在线玩家: Ghost\nS (a:1):";
        let servers = parse_status(text);
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].version, "");
        assert!(servers[0].players.is_empty());
        assert_eq!(servers[0].status, ServerState::Offline);
    }

    #[test]
    fn test_partial_block_is_kept() {
        let servers = parse_status("A (a:1):\nB (b:2):\n服务器版本: 1.19");
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].status, ServerState::Offline);
        assert_eq!(servers[1].version, "1.19");
    }

    #[test]
    fn test_timestamp_applies_to_later_blocks() {
        let text = "A (a:1):\n检查时间: 2024-01-01 00:00\nB (b:2):";
        let servers = parse_status(text);
        assert_eq!(servers[0].timestamp, "");
        assert_eq!(servers[1].timestamp, "2024-01-01 00:00");
    }

    #[test]
    fn test_header_without_address() {
        let servers = parse_status("Lobby:");
        assert_eq!(servers[0].name, "Lobby");
        assert_eq!(servers[0].address, "");
    }

    #[test]
    fn test_unknown_lines_ignored() {
        let servers = parse_status("S (a:1):\nMOTD: hello\n服务器版本: 1.20");
        assert_eq!(servers[0].version, "1.20");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_status("").is_empty());
        assert!(parse_status("\n  \n").is_empty());
    }
}
