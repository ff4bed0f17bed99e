// Build-Script: Wird vor dem Kompilieren ausgeführt
// Reicht WiFi-Credentials durch und konfiguriert den Linker für den ESP32-C6

fn main() {
    // .env ist optional: ohne Credentials startet die Firmware als Access Point
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("ℹ️  .env file nicht gefunden ({}), Access-Point-Modus falls WIFI_SSID fehlt", e);
    }

    // Werte landen per option_env!() in src/config.rs
    for key in ["WIFI_SSID", "WIFI_PASSWORD"] {
        println!("cargo:rerun-if-env-changed={}", key);
        if let Ok(value) = std::env::var(key) {
            println!("cargo:rustc-env={}={}", key, value);
        }
    }
    println!("cargo:rerun-if-changed=.env");

    linker_be_nice();

    // defmt.x - Symbole für defmt's binäres Log-Format
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    // linkall.x - Flash/RAM-Layout, muss als LETZTES kommen
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

// Wird vom Linker als "--error-handling-script" aufgerufen und gibt
// Hinweise zu typischen fehlenden Symbolen aus
fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 2 {
        let kind = &args[1];
        let what = &args[2];

        if kind.as_str() != "undefined-symbol" {
            std::process::exit(1);
        }

        let hint = match what.as_str() {
            what if what.starts_with("_defmt_") => {
                Some("`defmt` not found - make sure `defmt.x` is added as a linker script")
            }
            "_stack_start" => Some("Is the linker script `linkall.x` missing?"),
            what if what.starts_with("esp_rtos_") => Some(
                "`esp-radio` has no scheduler enabled. Make sure `esp_rtos::start` runs before `esp_radio::init`.",
            ),
            "free" | "malloc" | "calloc" | "get_free_internal_heap_size" => {
                Some("Did you forget the `esp-alloc` dependency or the `heap_allocator!` call?")
            }
            _ => None,
        };
        if let Some(hint) = hint {
            eprintln!();
            eprintln!("💡 {}", hint);
            eprintln!();
        }

        std::process::exit(0);
    }

    println!(
        "cargo:rustc-link-arg=--error-handling-script={}",
        std::env::current_exe().unwrap().display()
    );
}
