#[allow(dead_code)]
#[derive(contactkit::form::FormModel)]
struct Profile {
    #[field(max_len = 2)]
    name: String,
}

fn main() {}
