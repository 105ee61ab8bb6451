use serde::Deserialize;

/// The `Value` member of a successful Alpaca response.
#[derive(Debug, Deserialize)]
pub(crate) struct ValueResponse<T> {
    #[serde(rename = "Value")]
    value: Option<T>,
}

impl<T> ValueResponse<T> {
    pub(crate) fn into_value(self) -> Option<T> {
        self.value
    }
}
