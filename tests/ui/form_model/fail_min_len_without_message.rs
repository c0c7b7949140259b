#[allow(dead_code)]
#[derive(contactkit::form::FormModel)]
struct Profile {
    #[field(required = "Name is required", min_len = 2)]
    name: String,
}

fn main() {}
