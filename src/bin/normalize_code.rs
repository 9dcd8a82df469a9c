use code_detective_lib::models::LanguageTag;
use code_detective_lib::services::normalize_code;

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn guess_language(path: &str) -> LanguageTag {
    let ext = std::path::Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "c" | "h" => LanguageTag::C,
        "cpp" | "cc" | "cxx" | "hpp" => LanguageTag::Cpp,
        "java" => LanguageTag::Java,
        "py" => LanguageTag::Python,
        _ => LanguageTag::Other(ext),
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  cargo run --bin normalize_code -- <source-file> [--language <C|C++|Java|Python>]\n\nNotes:\n  - Without --language the tag is guessed from the file extension.\n  - Prints exactly the text handed to the classifiers."
        );
        return Ok(());
    }

    let path = args[1].clone();
    let language = parse_arg_value(&args, "--language")
        .map(|l| LanguageTag::parse(&l))
        .unwrap_or_else(|| guess_language(&path));

    let code = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("read {} failed: {}", path, e))?;
    let normalized = normalize_code(&code, &language);

    eprintln!("File: {}", path);
    eprintln!("Language: {}", language);
    eprintln!(
        "Input: {} chars, normalized: {} chars",
        code.chars().count(),
        normalized.chars().count()
    );
    println!("{}", normalized);
    Ok(())
}
