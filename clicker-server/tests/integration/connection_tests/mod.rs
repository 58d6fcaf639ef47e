mod test_bad_request_closes;
mod test_client_close_is_answered;
mod test_single_peer_joins_room;
