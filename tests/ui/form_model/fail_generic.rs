#[allow(dead_code)]
#[derive(contactkit::form::FormModel)]
struct Wrapper<T> {
    value: T,
}

fn main() {}
