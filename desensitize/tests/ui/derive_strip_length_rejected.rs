use desensitize::Desensitize;

#[allow(dead_code)]
#[derive(Desensitize)]
struct Card {
    #[desensitize(strategy = Strip, value = "x")]
    number: String,
}

fn main() {}
