#[allow(dead_code)]
#[derive(contactkit::form::FormModel)]
struct Pair(String, String);

fn main() {}
