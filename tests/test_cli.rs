use holdem_mccfr::cli::run_with_args;

fn args(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}

#[test]
fn test_eval_command() {
    run_with_args(args("mccfr eval AsKsQsJsTs2h3d"));
}

#[test]
fn test_train_command_text_report() {
    run_with_args(args("mccfr train --iterations 2 --capacity 64 --top 3"));
}

#[test]
fn test_train_command_json_single_player() {
    run_with_args(args(
        "mccfr train --epochs 2 --iterations 1 --seed 7 --capacity 64 --top 2 --player 1 --json",
    ));
}
