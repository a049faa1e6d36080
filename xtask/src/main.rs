/// The xtask binary delegates entirely to nih_plug_xtask, which provides
/// the `bundle` subcommand. Usage:
///
///   cargo xtask bundle simple-reverb --release
///
/// This compiles the plugin as a cdylib and packages it into
/// `target/bundled/Simple Reverb.vst3` and `Simple Reverb.clap`.
fn main() -> nih_plug_xtask::Result<()> {
    nih_plug_xtask::main()
}
