use desensitize::Desensitize;

#[allow(dead_code)]
#[derive(Desensitize)]
struct Account {
    #[desensitize(strategy = Custom)]
    nickname: String,
}

fn main() {}
