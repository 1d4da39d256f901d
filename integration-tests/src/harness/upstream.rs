use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

/// Start an origin that answers every request with `"<path>\n<host>"`.
///
/// Returns the bound port.
pub fn start_echo_upstream() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind upstream");
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            let path = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();

            let mut host = String::new();
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) if line == "\r\n" => break,
                    Ok(_) => {
                        if let Some((name, value)) = line.split_once(':') {
                            if name.eq_ignore_ascii_case("host") {
                                host = value.trim().to_string();
                            }
                        }
                    }
                }
            }

            let body = format!("{path}\n{host}");
            let _ = write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
        }
    });

    port
}
