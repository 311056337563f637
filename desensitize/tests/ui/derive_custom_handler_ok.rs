use desensitize::{Config, Desensitize, Desensitizer, Error};

mod handlers {
    use super::*;

    #[derive(Default)]
    pub struct Uppercase;

    impl Desensitizer for Uppercase {
        fn apply(&self, text: &str, _config: &Config) -> Result<String, Error> {
            Ok(text.to_uppercase())
        }
    }
}

#[derive(Desensitize)]
struct Account {
    #[desensitize(strategy = CUSTOM, handler = handlers::Uppercase)]
    nickname: String,
}

fn main() {
    let account = Account {
        nickname: "smile".into(),
    };
    let json = serde_json::to_string(&account).unwrap();
    assert_eq!(json, r#"{"nickname":"SMILE"}"#);
}
