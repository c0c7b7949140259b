#[allow(dead_code)]
#[derive(contactkit::form::FormModel)]
enum Choice {
    Yes,
    No,
}

fn main() {}
