//! End-to-end behavior of the built-in strategies through `Config`.
//!
//! These tests verify that:
//! - every built-in strategy passes absent and empty input through
//! - the documented masking examples hold
//! - composition obeys `a.then(b) == b.compose(a) == b(a(x))`
//! - region clamping never panics and never masks outside the text

use desensitize::{
    Config, Desensitizer, Error, Strategy, from_fn,
    replace::{replace_each, replace_once},
};

fn config(strategy: Strategy) -> Config {
    Config::new(strategy).unwrap()
}

fn strip(value: &str) -> Config {
    Config::builder(Strategy::Strip).value(value).build().unwrap()
}

mod passthrough {
    use super::*;

    #[test]
    fn absent_input_is_absent_output() {
        let configs = [
            config(Strategy::All),
            config(Strategy::Address),
            config(Strategy::Email),
            Config::builder(Strategy::Regex).value("abc").build().unwrap(),
            strip("3"),
            Config::builder(Strategy::Custom)
                .handler(from_fn(|_text, _config| Ok("mock".to_owned())))
                .build()
                .unwrap(),
        ];
        for config in &configs {
            assert_eq!(config.apply(None).unwrap(), None, "{config:?}");
        }
    }

    #[test]
    fn empty_input_is_returned_unchanged() {
        let configs = [
            config(Strategy::All),
            config(Strategy::Address),
            config(Strategy::Email),
            Config::builder(Strategy::Regex).value("^").replacement("x").build().unwrap(),
            strip("-3"),
        ];
        for config in &configs {
            assert_eq!(config.apply(Some("")).unwrap().as_deref(), Some(""), "{config:?}");
        }
    }
}

mod strategies {
    use super::*;

    #[test]
    fn all() {
        assert_eq!(config(Strategy::All).apply_str("smile").unwrap(), "*****");
        let collapsed = Config::builder(Strategy::All).repeat(false).build().unwrap();
        assert_eq!(collapsed.apply_str("smile").unwrap(), "*");
    }

    #[test]
    fn address() {
        let address = config(Strategy::Address);
        let masked = address.apply_str("广东省深圳市南山区高新园万象天地").unwrap();
        assert_eq!(masked, "广东省深圳市南山********");
        assert_eq!(masked.chars().count(), 16);
        assert_eq!(address.apply_str("南山区").unwrap(), "***");
    }

    #[test]
    fn email() {
        let email = config(Strategy::Email);
        assert_eq!(email.apply_str("huanghs@ihason.com").unwrap(), "h******@ihason.com");
        assert_eq!(email.apply_str("h@ihason.com").unwrap(), "h@ihason.com");
        assert_eq!(email.apply_str("@ihason.com").unwrap(), "@ihason.com");
        assert_eq!(email.apply_str("no-at-sign").unwrap(), "no-at-sign");
    }

    #[test]
    fn strip() {
        assert_eq!(super::strip("3").apply_str("smile").unwrap(), "***le");
        assert_eq!(super::strip("-3").apply_str("smile").unwrap(), "sm***");
        assert_eq!(super::strip("6").apply_str("smile").unwrap(), "*****");
        assert_eq!(super::strip("-6").apply_str("smile").unwrap(), "*****");
        assert_eq!(super::strip("0").apply_str("smile").unwrap(), "smile");
    }

    #[test]
    fn regex() {
        let regex = Config::builder(Strategy::Regex)
            .value("abc")
            .replacement("*")
            .build()
            .unwrap();
        assert_eq!(regex.apply_str("hey, abc!").unwrap(), "hey, *!");
        assert_eq!(regex.apply_str("abc abc").unwrap(), "* *");
        assert_eq!(regex.apply_str("nothing here").unwrap(), "nothing here");
    }

    #[test]
    fn custom_replacement_symbols() {
        let hashed = Config::builder(Strategy::Email).replacement("#").build().unwrap();
        assert_eq!(hashed.apply_str("huanghs@ihason.com").unwrap(), "h######@ihason.com");

        let word = Config::builder(Strategy::Email)
            .replacement("<hidden>")
            .build()
            .unwrap();
        assert_eq!(word.apply_str("huanghs@ihason.com").unwrap(), "h<hidden>@ihason.com");
    }

    #[test]
    fn strategy_names_parse() {
        assert_eq!("email".parse::<Strategy>().unwrap(), Strategy::Email);
        assert_eq!("STRIP".parse::<Strategy>().unwrap(), Strategy::Strip);
        assert!(matches!(
            "phone".parse::<Strategy>(),
            Err(Error::UnknownStrategy { .. })
        ));
    }
}

mod composition {
    use super::*;

    const INPUTS: [&str; 5] = ["", "smile", "huanghs@ihason.com", "a@b", "广东省深圳市南山区高新园万象天地"];

    #[test]
    fn then_equals_sequential_application() {
        let config = strip("-3");
        let builtins = [Strategy::All, Strategy::Address, Strategy::Email, Strategy::Strip];
        for a in builtins {
            for b in builtins {
                for input in INPUTS {
                    let expected = b.apply(&a.apply(input, &config).unwrap(), &config).unwrap();
                    assert_eq!(a.then(b).apply(input, &config).unwrap(), expected);
                    assert_eq!(b.compose(a).apply(input, &config).unwrap(), expected);
                }
            }
        }
    }

    #[test]
    fn strip_then_email_example() {
        let config = strip("-3");
        let masked = Strategy::Strip
            .then(Strategy::Email)
            .apply("huanghs@ihason.com", &config)
            .unwrap();
        assert_eq!(masked, "h******@ihason.***");
    }

    #[test]
    fn chains_nest() {
        let config = config(Strategy::All);
        let tag = |suffix: &'static str| from_fn(move |text, _config| Ok(format!("{text}{suffix}")));
        let pipeline = tag("1").then(tag("2")).then(tag("3"));
        assert_eq!(pipeline.apply("x", &config).unwrap(), "x123");
        let pipeline = tag("1").compose(tag("2")).compose(tag("3"));
        assert_eq!(pipeline.apply("x", &config).unwrap(), "x321");
    }
}

mod idempotence {
    use super::*;

    // Masking already-masked output with a different region can change it
    // further. This is expected.
    #[test]
    fn remasking_with_another_region_changes_the_output() {
        let first = strip("2").apply_str("smile").unwrap();
        assert_eq!(first, "**ile");
        let second = strip("-2").apply_str(&first).unwrap();
        assert_eq!(second, "**i**");
        assert_ne!(first, second);
    }

    #[test]
    fn collapsed_replacement_is_not_stable() {
        let collapsed = Config::builder(Strategy::Strip)
            .value("2")
            .replacement("*")
            .repeat(false)
            .build()
            .unwrap();
        let once = collapsed.apply_str("smile").unwrap();
        assert_eq!(once, "*ile");
        assert_eq!(collapsed.apply_str(&once).unwrap(), "*le");
    }
}

mod region_clamping {
    use super::*;

    #[test]
    fn start_past_the_end_is_a_no_op() {
        for start in [6, 7, 100, usize::MAX] {
            assert_eq!(replace_each("smile", start, start.saturating_add(3), '*'), "smile");
            assert_eq!(replace_once("smile", start, usize::MAX, "*"), "smile");
        }
    }

    #[test]
    fn start_at_or_after_end_is_a_no_op() {
        for (start, end) in [(3, 2), (4, 0), (5, 99), (2, 2)] {
            assert_eq!(replace_each("smile", start, end, '*'), "smile");
            assert_eq!(replace_once("smile", start, end, "*"), "smile");
        }
    }

    #[test]
    fn end_is_clamped_to_the_length() {
        assert_eq!(replace_each("smile", 2, 99, '*'), "sm***");
        assert_eq!(replace_once("smile", 2, 99, "*"), "sm*");
    }

    #[test]
    fn strip_handles_extreme_lengths() {
        for value in ["9223372036854775807", "-9223372036854775808"] {
            assert_eq!(strip(value).apply_str("smile").unwrap(), "*****");
        }
    }
}
