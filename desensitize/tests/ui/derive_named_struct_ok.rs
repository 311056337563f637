use desensitize::{Desensitize, DesensitizeFields};

#[derive(Desensitize)]
struct Person {
    id: u64,
    #[desensitize(strategy = Email)]
    email: String,
    #[desensitize(strategy = Strip, value = "-4", replacement = "#", repeat = true)]
    phone: String,
}

fn main() {
    let person = Person {
        id: 1,
        email: "huanghs@ihason.com".into(),
        phone: "13812345678".into(),
    };
    Person::validate_fields().unwrap();
    let json = serde_json::to_string(&person).unwrap();
    assert_eq!(
        json,
        r##"{"id":1,"email":"h******@ihason.com","phone":"1381234####"}"##
    );
}
