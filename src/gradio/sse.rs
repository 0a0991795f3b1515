/// One server-sent event from the call stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Splits an event-stream body into events.
///
/// Events are separated by blank lines. Multiple `data:` lines are joined
/// with `\n`; comment lines and unknown fields are ignored. Lines must end in
/// `\n` or `\r\n`; a lone `\r` is not treated as a line break.
pub fn parse_events(body: &str) -> Vec<SseEvent> {
    let mut events = Vec::new();
    let mut event = String::new();
    let mut data: Vec<&str> = Vec::new();

    for line in body.lines().chain(std::iter::once("")) {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            if !event.is_empty() || !data.is_empty() {
                events.push(SseEvent {
                    event: if event.is_empty() {
                        "message".to_string()
                    } else {
                        std::mem::take(&mut event)
                    },
                    data: data.join("\n"),
                });
                data.clear();
            }
            continue;
        }

        if line.starts_with(':') {
            continue;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => event = value.to_string(),
            "data" => data.push(value),
            _ => {}
        }
    }

    events
}
