use std::{borrow::Cow, rc::Rc, sync::Arc};

use desensitize::Desensitize;

#[derive(Desensitize)]
struct Texts<'a> {
    #[desensitize(strategy = All)]
    borrowed: &'a str,
    #[desensitize(strategy = All)]
    cow: Cow<'a, str>,
    #[desensitize(strategy = All)]
    boxed: Box<str>,
    #[desensitize(strategy = All)]
    shared: Arc<str>,
    #[desensitize(strategy = All)]
    local: Rc<str>,
    #[desensitize(strategy = All)]
    optional: Option<&'a String>,
}

fn main() {
    let owned = String::from("xy");
    let texts = Texts {
        borrowed: "ab",
        cow: Cow::Owned("cd".into()),
        boxed: "ef".into(),
        shared: "gh".into(),
        local: "ij".into(),
        optional: Some(&owned),
    };
    let json = serde_json::to_value(&texts).unwrap();
    for key in ["borrowed", "cow", "boxed", "shared", "local", "optional"] {
        assert_eq!(json[key], "**");
    }
}
