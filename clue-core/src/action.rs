use serde::Deserialize;

/// An inbound payload decoded into what the user asked for.
///
/// Plain tokens come from content buttons, JSON objects from game buttons.
/// Range checks belong to the state machine, so `Room(-1)` is a valid decode.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Next,
    Prev,
    Home,
    ToRules,
    ToGreeting,
    ToRooms,
    ToExit,
    ToRoom,
    ToGame,
    ThrowDice,
    SelectPlace,
    HideState,
    ShowState,
    Room(i64),
    NewLocation(i64),
    AccusedPerson(i64),
    AccusedWeapon(i64),
    Suspicion,
    Accuse(i64),
    Unknown,
}

#[derive(Debug, Default, Deserialize)]
struct JsonPayload {
    room: Option<i64>,
    new_location: Option<i64>,
    accused_person: Option<i64>,
    accused_weapon: Option<i64>,
    suspiction: Option<serde_json::Value>,
    accuse: Option<i64>,
}

impl Action {
    pub fn parse(payload: &str) -> Self {
        let payload = payload.trim();
        match payload {
            "next" => Self::Next,
            "prev" => Self::Prev,
            "home" => Self::Home,
            "to_rules" => Self::ToRules,
            "to_greeting" => Self::ToGreeting,
            "to_rooms" => Self::ToRooms,
            "to_exit" => Self::ToExit,
            "to_room" => Self::ToRoom,
            "to_game" => Self::ToGame,
            "throw_dice" => Self::ThrowDice,
            "select_place" => Self::SelectPlace,
            "hide_state" => Self::HideState,
            "show_state" => Self::ShowState,
            _ if payload.starts_with('{') => Self::from_json(payload),
            _ => Self::Unknown,
        }
    }

    fn from_json(payload: &str) -> Self {
        let Ok(fields) = serde_json::from_str::<JsonPayload>(payload) else {
            return Self::Unknown;
        };

        if let Some(id) = fields.room {
            Self::Room(id)
        } else if let Some(id) = fields.new_location {
            Self::NewLocation(id)
        } else if let Some(id) = fields.accused_person {
            Self::AccusedPerson(id)
        } else if let Some(id) = fields.accused_weapon {
            Self::AccusedWeapon(id)
        } else if fields.suspiction.is_some() {
            Self::Suspicion
        } else if let Some(n) = fields.accuse {
            Self::Accuse(n)
        } else {
            Self::Unknown
        }
    }

    /// Payload a button must carry to produce this action
    pub fn payload(&self) -> String {
        match self {
            Self::Next => "next".to_string(),
            Self::Prev => "prev".to_string(),
            Self::Home => "home".to_string(),
            Self::ToRules => "to_rules".to_string(),
            Self::ToGreeting => "to_greeting".to_string(),
            Self::ToRooms => "to_rooms".to_string(),
            Self::ToExit => "to_exit".to_string(),
            Self::ToRoom => "to_room".to_string(),
            Self::ToGame => "to_game".to_string(),
            Self::ThrowDice => "throw_dice".to_string(),
            Self::SelectPlace => "select_place".to_string(),
            Self::HideState => "hide_state".to_string(),
            Self::ShowState => "show_state".to_string(),
            Self::Room(id) => format!(r#"{{"room": {}}}"#, id),
            Self::NewLocation(id) => format!(r#"{{"new_location": {}}}"#, id),
            Self::AccusedPerson(id) => format!(r#"{{"accused_person": {}}}"#, id),
            Self::AccusedWeapon(id) => format!(r#"{{"accused_weapon": {}}}"#, id),
            Self::Suspicion => r#"{"suspiction": {}}"#.to_string(),
            Self::Accuse(n) => format!(r#"{{"accuse": {}}}"#, n),
            Self::Unknown => String::new(),
        }
    }
}
