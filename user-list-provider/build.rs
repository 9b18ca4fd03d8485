use rustc_version::{Channel, version_meta};

fn main() {
    println!("cargo::rustc-check-cfg=cfg(CHANNEL_NIGHTLY)");
    // Lets docs.rs builds enable doc_auto_cfg:
    if let Ok(meta) = version_meta()
        && meta.channel == Channel::Nightly
    {
        println!("cargo:rustc-cfg=CHANNEL_NIGHTLY");
    }
}
