//! Tests for the wire text of server messages.

use wythoff_games::{
    CLOSED_CUE, LOSS_CUE, MoveError, Piles, RETRY_CUE, Seat, ServerMessage, WIN_CUE,
    YOUR_TURN_CUE,
};

#[test]
fn test_game_starting_lists_piles() {
    let msg = ServerMessage::GameStarting {
        piles: Piles::new(5, 10),
    };
    assert_eq!(msg.to_string(), "Game starting...\n---\nCurrent Piles: [5, 10]");
}

#[test]
fn test_turn_messages() {
    assert_eq!(ServerMessage::YourTurn.to_string(), YOUR_TURN_CUE);
    assert_eq!(
        ServerMessage::TurnNotice { turn: Seat::One }.to_string(),
        "It is Player 1's turn."
    );
}

#[test]
fn test_rejections_carry_reason_and_cue() {
    let malformed = ServerMessage::InvalidFormat.to_string();
    assert!(malformed.contains("Invalid input format."));
    assert!(malformed.contains(RETRY_CUE));

    let illegal = ServerMessage::IllegalMove {
        reason: MoveError::NotEnoughObjects(0),
    }
    .to_string();
    assert_eq!(
        illegal,
        "Received error from server: \"Illegal move: not enough objects in pile 0\"\n\
         Please enter a valid move."
    );

    let wait = ServerMessage::NotYourTurn.to_string();
    assert!(wait.contains("It's not your turn."));
    assert!(wait.contains("Please wait for your turn."));
    assert!(!wait.contains(RETRY_CUE));
    assert!(!wait.contains(YOUR_TURN_CUE));
}

#[test]
fn test_final_messages() {
    let piles = Piles::new(0, 0);

    let victory = ServerMessage::Victory { piles };
    assert!(victory.is_final());
    assert_eq!(
        victory.to_string(),
        "---\nCurrent Piles: [0, 0]\nCongratulations! You win!\nServer has closed the connection."
    );

    let defeat = ServerMessage::Defeat {
        winner: Seat::Zero,
        piles,
    }
    .to_string();
    assert!(defeat.contains(LOSS_CUE));
    assert!(defeat.contains("Player 0 is the winner."));
    assert!(defeat.ends_with(&format!("{CLOSED_CUE}.")));
    assert!(!defeat.contains(WIN_CUE));

    let forfeit = ServerMessage::OpponentLeft {
        opponent: Seat::One,
    }
    .to_string();
    assert!(forfeit.contains("Player 1 disconnected"));
    assert!(forfeit.contains(CLOSED_CUE));
}

#[test]
fn test_non_final_messages() {
    assert!(!ServerMessage::Connected.is_final());
    assert!(!ServerMessage::YourTurn.is_final());
    assert!(ServerMessage::SessionFull.is_final());
}
