use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Feeds the `--version` long output
    vergen_gitcl::Emitter::default()
        .add_instructions(
            &vergen_gitcl::BuildBuilder::default()
                .build_date(true)
                .build()?,
        )?
        .add_instructions(
            &vergen_gitcl::CargoBuilder::default()
                .target_triple(true)
                .build()?,
        )?
        .add_instructions(
            &vergen_gitcl::GitclBuilder::default()
                .sha(true)
                .build()?,
        )?
        .emit()?;
    Ok(())
}
