use garde::Validate;
use serde::Deserialize;

use crate::JoinError;

// Join form, as typed on the landing page:
// {
//      gameCode,  [Exactly 7 ASCII digits]
//      teamName   [Non-empty once trimmed, maximum length 32]
// }
#[derive(Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[garde(ascii, pattern("^[0-9]{7}$"))]
    pub game_code: String,
    #[garde(length(min=1, max=32))]
    pub team_name: String,
}

impl JoinRequest {
    pub fn new<T>(game_code: T, team_name: T) -> Self
    where
        T: AsRef<str>,
    {
        Self {
            game_code: game_code.as_ref().trim().to_owned(),
            team_name: team_name.as_ref().trim().to_owned(),
        }
    }

    /// Trims both fields then runs the declared checks.
    pub fn validated(self) -> Result<Self, JoinError> {
        let request = Self::new(self.game_code, self.team_name);
        if let Err(err) = request.validate(&()) {
            tracing::info!("Join validation failed with reason: {err}");
            return Err(JoinError::Invalid(err.to_string()));
        }
        Ok(request)
    }
}
