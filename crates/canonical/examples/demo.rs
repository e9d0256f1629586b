use canonical::{normalize, normalize_tokens};

fn main() {
    let samples = [
        "Nosferatu, eine Symphonie des Grauens",
        "F.W. Murnau",
        "Friedrich Wilhelm Múrnau",
        "Spider-Man: Into the Spider-Verse",
        "Léon: The Professional",
    ];

    for sample in samples {
        println!("{sample:?}");
        println!("  normalized: {:?}", normalize(sample));
        println!("  tokens:     {:?}", normalize_tokens(sample));
    }
}
