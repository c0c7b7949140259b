#[allow(dead_code)]
#[derive(contactkit::form::FormModel)]
struct Profile {
    #[field(pattern = r"^\d+$")]
    referral: String,
}

fn main() {}
