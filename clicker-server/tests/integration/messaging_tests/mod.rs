mod test_peer_sends_signal;
mod test_ping_pong;
mod test_rapid_signal_sending;
mod test_unknown_signal_rejected;
