//! Edge cases: Unicode text, unusual replacements, foreign configurations,
//! and handler resolution.

use std::sync::Arc;

use desensitize::{
    Config, ConfigOptions, Desensitizer, Error, HandlerRegistry, Replacement, Strategy, from_fn,
};

mod unicode {
    use super::*;

    #[test]
    fn regions_count_characters_not_bytes() {
        let strip = Config::builder(Strategy::Strip).value("2").build().unwrap();
        assert_eq!(strip.apply_str("深圳市").unwrap(), "**市");
        assert_eq!(strip.apply_str("😀😃x").unwrap(), "**x");
    }

    #[test]
    fn email_with_multibyte_local_part() {
        let email = Config::new(Strategy::Email).unwrap();
        assert_eq!(email.apply_str("黄海生@ihason.com").unwrap(), "黄**@ihason.com");
    }

    #[test]
    fn multibyte_replacement_symbol_repeats() {
        let all = Config::builder(Strategy::All).replacement("●").build().unwrap();
        assert_eq!(all.replacement_policy(), &Replacement::Repeat('●'));
        assert_eq!(all.apply_str("abc").unwrap(), "●●●");
    }

    #[test]
    fn combining_sequences_are_counted_per_scalar() {
        // "é" written as 'e' + U+0301 is two characters.
        let all = Config::new(Strategy::All).unwrap();
        assert_eq!(all.apply_str("e\u{301}").unwrap(), "**");
    }
}

mod replacements {
    use super::*;

    #[test]
    fn empty_replacement_removes_the_region() {
        let email = Config::builder(Strategy::Email).replacement("").build().unwrap();
        assert_eq!(email.apply_str("huanghs@ihason.com").unwrap(), "h@ihason.com");
    }

    #[test]
    fn multi_character_replacement_never_repeats() {
        let strip = Config::builder(Strategy::Strip)
            .value("-3")
            .replacement("**")
            .build()
            .unwrap();
        assert_eq!(strip.apply_str("smile").unwrap(), "sm**");
    }

    #[test]
    fn regex_supports_group_references_and_literal_dollars() {
        let regex = Config::builder(Strategy::Regex)
            .value(r"(?P<user>\w)\w*@")
            .replacement("${user}***@")
            .build()
            .unwrap();
        assert_eq!(regex.apply_str("huanghs@ihason.com").unwrap(), "h***@ihason.com");

        let price = Config::builder(Strategy::Regex)
            .value(r"\d+")
            .replacement("$$")
            .build()
            .unwrap();
        assert_eq!(price.apply_str("total 42").unwrap(), "total $");
    }
}

mod foreign_config {
    use super::*;

    #[test]
    fn strategies_read_values_from_any_config() {
        let config = Config::builder(Strategy::All).value("3").build().unwrap();
        assert_eq!(Strategy::Strip.apply("smile", &config).unwrap(), "***le");

        let config = Config::builder(Strategy::All).value("abc").build().unwrap();
        assert_eq!(Strategy::Regex.apply("hey, abc!", &config).unwrap(), "hey, *!");
    }

    #[test]
    fn invalid_foreign_values_are_errors() {
        let config = Config::builder(Strategy::All).value("(").build().unwrap();
        assert!(matches!(
            Strategy::Regex.apply("abc", &config),
            Err(Error::InvalidPattern { .. })
        ));
        assert!(matches!(
            Strategy::Strip.apply("abc", &config),
            Err(Error::InvalidStripLength { .. })
        ));
        assert!(matches!(
            Strategy::Custom.apply("abc", &config),
            Err(Error::MissingHandler)
        ));
    }
}

mod handlers {
    use super::*;

    #[derive(Default)]
    struct Stub;

    impl Desensitizer for Stub {
        fn apply(&self, _text: &str, _config: &Config) -> Result<String, Error> {
            Ok("mock".to_owned())
        }
    }

    #[test]
    fn custom_handlers_see_empty_text() {
        let config = Config::builder(Strategy::Custom).handler(Stub).build().unwrap();
        assert_eq!(config.apply(Some("")).unwrap().as_deref(), Some("mock"));
        assert_eq!(config.apply(None).unwrap(), None);
    }

    #[test]
    fn handlers_receive_the_config() {
        let config = Config::builder(Strategy::Custom)
            .value("-2")
            .handler(Strategy::Strip.then(Strategy::Email))
            .build()
            .unwrap();
        assert_eq!(config.apply_str("hs@ihason.com").unwrap(), "h*@ihason.c**");
    }

    #[test]
    fn shared_handlers_are_reused() {
        let shared: Arc<dyn Desensitizer> = Arc::new(Stub);
        let first = Config::builder(Strategy::Custom)
            .shared_handler(Arc::clone(&shared))
            .build()
            .unwrap();
        let second = first.clone();
        assert_eq!(first.apply_str("a").unwrap(), "mock");
        assert_eq!(second.apply_str("b").unwrap(), "mock");
        assert_eq!(Arc::strong_count(&shared), 3);
    }

    #[test]
    fn options_resolve_handlers_by_id() {
        let mut registry = HandlerRegistry::new();
        registry.register::<Stub>("stub").unwrap();

        let options = ConfigOptions {
            handler: Some("stub".into()),
            ..ConfigOptions::new(Strategy::Custom)
        };
        let config = options.resolve(&registry).unwrap();
        assert_eq!(config.handler_id(), Some("stub"));
        assert_eq!(config.apply_str("huang@ihason.com").unwrap(), "mock");

        let missing = ConfigOptions::new(Strategy::Custom).resolve(&registry);
        assert!(matches!(missing, Err(Error::MissingHandler)));
    }

    #[test]
    fn handler_errors_are_not_config_errors() {
        let config = Config::builder(Strategy::Custom)
            .handler(from_fn(|_text, _config| Err(Error::handler("offline"))))
            .build()
            .unwrap();
        let err = config.apply_str("secret").unwrap_err();
        assert!(!err.is_config_error());
        assert_eq!(err.to_string(), "offline");
    }
}
