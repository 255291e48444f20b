//! Shell bodies for the `run:` steps. The scripts are opaque to debrepo; only the
//! interpolated lists are derived.

use debrepo_types::manifest::LayoutSettings;
use debrepo_types::plan::RepoPlan;

/// Moves fetched `.deb` files into `<output_dir>/deb/<codename>/pool/<component>/`,
/// scans one `Packages` index per Debian architecture and signs a `Release` file.
pub fn render_move_script(layout: &LayoutSettings, plan: &RepoPlan) -> String {
    let root = format!("{}/deb", layout.output_dir);
    let codenames = plan.codename_list().join(" ");
    let packages = plan.packages.join(" ");
    let arches = plan.architectures.join(" ");
    let component = &layout.component;
    let release_script = &layout.release_script;

    format!(
        r#"repo="$(pwd)"
for codename in {codenames}; do
    # Create pool directory
    mkdir -p {root}/$codename/pool/{component}/
    # Move the debs
    pushd {root}/$codename/pool/{component}/
    for pkg in {packages}; do
        for file in $repo/$pkg-$codename*/*.deb; do
            mv -v $file .
        done
    done
    popd

    # Create dist hierarchy
    pushd {root}/$codename/
    for arch in {arches}; do
        mkdir -p dists/$codename/{component}/binary-$arch/
        dpkg-scanpackages --arch $arch pool/{component}/ > dists/$codename/{component}/binary-$arch/Packages
    done
    popd

    # Create Release file
    pushd {root}/$codename/dists/$codename/
      bash $repo/{release_script} $codename > Release
      gpg --armour --sign --detach-sign --output Release.gpg Release
    popd
done
"#
    )
}

/// Fetches the HTML index generator and runs it over the repository tree.
pub fn render_index_script(layout: &LayoutSettings) -> String {
    let url = &layout.index_generator_url;
    let output_dir = &layout.output_dir;
    format!(
        r#"curl -o gen-indexes.py {url}
find {output_dir} > files-list.txt
cat files-list.txt
cat files-list.txt | python3 gen-indexes.py .
tree .
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Planner, builtin_manifest};

    fn loop_line<'a>(script: &'a str, var: &str) -> &'a str {
        let prefix = format!("for {var} in ");
        script
            .lines()
            .map(str::trim_start)
            .find(|l| l.starts_with(&prefix))
            .unwrap_or_else(|| panic!("no loop over {var}"))
    }

    #[test]
    fn move_script_interpolates_sorted_codenames() {
        let m = builtin_manifest();
        let plan = Planner::new().plan(&m).expect("plan");
        let script = render_move_script(&m.layout, &plan);
        assert_eq!(
            loop_line(&script, "codename"),
            "for codename in bookworm bullseye buster; do"
        );
        assert_eq!(
            loop_line(&script, "pkg"),
            "for pkg in asl-dahdi allstarlink asl-update-node-list; do"
        );
        assert_eq!(loop_line(&script, "arch"), "for arch in amd64 armhf; do");
        assert!(script.contains("mkdir -p asl-pkgs/deb/$codename/pool/main/"));
        assert!(script.contains("bash $repo/generate-release.sh $codename > Release"));
    }

    #[test]
    fn move_script_never_mentions_machine_tokens() {
        let m = builtin_manifest();
        let plan = Planner::new().plan(&m).expect("plan");
        let script = render_move_script(&m.layout, &plan);
        for arch in &m.architectures {
            assert!(!script.contains(&arch.machine), "{} leaked", arch.machine);
            assert!(script.contains(&arch.debian));
        }
    }

    #[test]
    fn index_script_uses_layout() {
        let m = builtin_manifest();
        let script = render_index_script(&m.layout);
        assert!(script.starts_with("curl -o gen-indexes.py https://"));
        assert!(script.contains("find asl-pkgs > files-list.txt"));
        assert!(script.ends_with("tree .\n"));
    }
}
