#[derive(Debug, Clone, Copy)]
pub enum HttpEvent {
    Rewrite,
    Request,
    Response,
}

impl HttpEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpEvent::Rewrite => "rewrite",
            HttpEvent::Request => "request",
            HttpEvent::Response => "response",
        }
    }
}
