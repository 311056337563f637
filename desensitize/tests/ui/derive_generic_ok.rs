use desensitize::Desensitize;

#[derive(Desensitize)]
struct Envelope<T, M>
where
    M: Clone,
{
    #[desensitize(strategy = Address)]
    secret: Option<T>,
    meta: M,
}

fn main() {
    let envelope = Envelope {
        secret: Some(String::from("广东省深圳市南山区高新园万象天地")),
        meta: 3_u8,
    };
    let json = serde_json::to_string(&envelope).unwrap();
    assert_eq!(json, r#"{"secret":"广东省深圳市南山********","meta":3}"#);
}
