use std::path::Path;
use std::process::Command;

const GIT_ENV_OVERRIDES: [&str; 4] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
];

pub fn git_command() -> Command {
    let mut cmd = Command::new("git");
    for key in GIT_ENV_OVERRIDES {
        cmd.env_remove(key);
    }
    cmd
}

pub fn run_git(repo: &Path, args: &[&str]) {
    let status = git_command()
        .args(args)
        .current_dir(repo)
        .status()
        .expect("Failed to invoke git");
    assert!(status.success(), "git command failed: {:?}", args);
}

/// Create a repository on branch `main` with one commit containing a
/// Dockerfile.
pub fn init_server_repo(repo: &Path) {
    std::fs::create_dir_all(repo).expect("Failed to create repo dir");
    run_git(repo, &["init"]);
    run_git(repo, &["checkout", "-b", "main"]);
    run_git(repo, &["config", "user.email", "test@example.com"]);
    run_git(repo, &["config", "user.name", "Test User"]);
    run_git(repo, &["config", "commit.gpgsign", "false"]);
    std::fs::write(repo.join("Dockerfile"), "FROM scratch\n").expect("Failed to write Dockerfile");
    run_git(repo, &["add", "."]);
    run_git(repo, &["commit", "-m", "init"]);
}

pub fn commit_file(repo: &Path, name: &str, contents: &str) {
    std::fs::write(repo.join(name), contents).expect("Failed to write file");
    run_git(repo, &["add", name]);
    run_git(repo, &["commit", "-m", &format!("add {name}")]);
}
