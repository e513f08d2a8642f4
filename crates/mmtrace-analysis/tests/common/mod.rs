//! Log fragments in the game client's wording, shared by integration tests.
#![allow(dead_code)]

pub fn registration(id: &str) -> String {
    format!(
        "12:00:00.010 API New Request: /v1.0/super/tournament/registerTournament {{\"tournamentId\":\"T1\"}}\n\
         12:00:00.220 API Success: /v1.0/super/tournament/registerTournament\n\
         {{\"success\":true,\"data\":{{\"registrationId\":\"{id}\",\"entryFee\":10.0}}}}\n"
    )
}

pub fn table_assignment(id: &str) -> String {
    format!(
        "12:00:01.000 API New Request: /v1.0/super/tournament/getTournamentDetails {{\"registrationId\":\"{id}\"}}\n\
         12:00:01.300 API Success: /v1.0/super/tournament/getTournamentDetails {{\"data\":{{\"registrationId\":\"{id}\",\
         \"registrationStatus\":\"TABLE_ASSIGNED\",\"gameplayServer\":{{\"gameId\":\"G-77\",\"podip\":\"10.2.3.4\"}}}}}}\n"
    )
}

pub fn table_pending(id: &str) -> String {
    format!(
        "12:00:01.000 API New Request: /v1.0/super/tournament/getTournamentDetails {{\"registrationId\":\"{id}\"}}\n\
         12:00:01.300 API Success: /v1.0/super/tournament/getTournamentDetails {{\"data\":{{\"registrationId\":\"{id}\",\
         \"registrationStatus\":\"REGISTERED\"}}}}\n"
    )
}

pub fn socket_url(id: &str) -> String {
    format!("12:00:02.000 Socket url- wss://gs.example/ws {{\"registrationId\":\"{id}\"}}\n")
}

pub fn socket_connected(id: &str) -> String {
    format!("12:00:02.100 Socket connected with id- k9x {{\"registrationId\":\"{id}\"}}\n")
}

pub fn socket_failed(id: &str) -> String {
    format!("12:00:02.100 Socket connection failed- timeout {{\"registrationId\":\"{id}\"}}\n")
}

pub fn queue_entry(id: &str) -> String {
    format!(
        "12:00:03.000 eventHandler gameplay socket event- {{\"en\":\"STATE\",\"registrationId\":\"{id}\",\"state\":\"FINDING\"}}\n"
    )
}

pub fn round_starting(id: &str) -> String {
    format!("12:00:09.000 eventHandler gameplay socket event- {{\"registrationId\":\"{id}\",\"en\":\"ROUND_STARTING\"}}\n")
}

pub fn matchmaking_failed(id: &str) -> String {
    format!(
        "12:00:30.000 eventHandler gameplay socket event- {{\"registrationId\":\"{id}\",\"en\":\"MATCH_MAKING_FAILED\"}}\n"
    )
}

pub const TIMER_EXPIRED: &str = "12:01:00.000 backToLobbyInterval Timer expired\n";

/// A session that made it all the way to a round.
pub fn full_success(id: &str) -> String {
    [
        registration(id),
        table_assignment(id),
        socket_url(id),
        socket_connected(id),
        queue_entry(id),
        round_starting(id),
    ]
    .concat()
}
