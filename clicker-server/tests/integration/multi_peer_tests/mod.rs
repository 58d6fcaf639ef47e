mod test_peer_leaves_other_stays;
mod test_tokens_are_isolated;
