/// Событие транспорта, поступающее из цикла чтения WebSocket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Text(String),
    Binary,
    /// Close frame received or the stream ended.
    Closed,
    /// Read error; treated exactly like `Closed`.
    Failed(String),
}

impl TransportEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransportEvent::Closed | TransportEvent::Failed(_))
    }
}
